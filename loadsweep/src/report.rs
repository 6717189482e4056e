//! Boundary to whatever persists run reports.
use loadsweep_core::RunReport;
use std::convert::Infallible;

/// Receives one [`RunReport`] per configuration, in sweep order.
pub trait ReportSink {
    type Error;

    fn record(&mut self, report: &RunReport) -> Result<(), Self::Error>;

    /// Called once after the last run.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl ReportSink for Vec<RunReport> {
    type Error = Infallible;

    fn record(&mut self, report: &RunReport) -> Result<(), Self::Error> {
        self.push(report.clone());
        Ok(())
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    type Error = S::Error;

    fn record(&mut self, report: &RunReport) -> Result<(), Self::Error> {
        (**self).record(report)
    }

    fn finish(&mut self) -> Result<(), Self::Error> {
        (**self).finish()
    }
}
