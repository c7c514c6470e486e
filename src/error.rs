use core::fmt;

/// Failure of a single sample request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcquireError {
    /// The requested conversion did not complete within the poll budget.
    Timeout {
        /// Completed conversions seen by the slot.
        completed: u32,
        /// Conversions triggered by the driver.
        issued: u32,
    },
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquireError::Timeout { completed, issued } => write!(
                f,
                "conversion timed out ({completed} of {issued} conversions completed)"
            ),
        }
    }
}

/// Failure of one measurement cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// A GPIO reconfiguration or level change failed.
    Pin(E),
    Acquisition(AcquireError),
}

impl<E> From<AcquireError> for Error<E> {
    fn from(err: AcquireError) -> Self {
        Error::Acquisition(err)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Pin(err) => write!(f, "pin error: {err:?}"),
            Error::Acquisition(err) => write!(f, "acquisition failed: {err}"),
        }
    }
}
