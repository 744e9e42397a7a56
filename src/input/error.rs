use crate::console::ConsoleError;

/// Operator input rejected by the reader, the parser or a range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    TooLong,
    NoData,
    /// More than one decimal point
    InvalidString,
    /// A character that is neither a digit nor a decimal point
    InvalidCharacter,
    ValueTooLarge,
    ValueTooSmall,
    TimedOut,
}

impl InputError {
    /// Notice shown to the operator before the menu is displayed again.
    pub fn notice(&self) -> &'static str {
        match self {
            Self::TooLong => "\r\n String entered is too long",
            Self::NoData => "\r\n No Value Entered",
            Self::InvalidString => "\r\n Too many decimal points",
            Self::InvalidCharacter => "\r\n Invalid character",
            Self::ValueTooLarge => "\r\n Value too large",
            Self::ValueTooSmall => "\r\n Value too small",
            Self::TimedOut => "\r\n No input received",
        }
    }
}

impl core::fmt::Display for InputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.notice().trim_start())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    Input(InputError),
    Console(ConsoleError),
}

impl From<InputError> for ReadError {
    fn from(e: InputError) -> Self {
        ReadError::Input(e)
    }
}

impl From<ConsoleError> for ReadError {
    fn from(e: ConsoleError) -> Self {
        match e {
            ConsoleError::Timeout => ReadError::Input(InputError::TimedOut),
            other => ReadError::Console(other),
        }
    }
}
