/// `Err` carries the message shown for a failed fixture.
pub type TestResult = Result<(), String>;

pub trait TestCase {
    fn name(&self) -> &str;
    fn expectation(&self) -> &'static str;
    fn execute(&self) -> TestResult;
}
