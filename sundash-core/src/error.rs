use thiserror::Error;

/// Everything that can end a dashboard run.
///
/// `Display` carries the underlying cause for logs; [`LookupError::user_message`]
/// is the text shown to the user.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("current location unavailable: {0}")]
    LocationUnavailable(String),

    /// No way to determine the current location at all, e.g. no home configured.
    #[error("current location not supported: {0}")]
    LocationUnsupported(String),

    #[error("location query is empty")]
    InvalidInput,

    #[error("no geocoding match for '{0}'")]
    NoMatchFound(String),

    #[error("geocoding service unavailable: {0}")]
    GeocodeUnavailable(String),

    #[error("sun data unavailable: {0}")]
    SunDataUnavailable(String),
}

impl LookupError {
    pub fn user_message(&self) -> String {
        let text = match self {
            LookupError::LocationUnavailable(_) => "Error getting current location.",
            LookupError::LocationUnsupported(hint) => {
                return format!("Current location is not supported. {hint}");
            }
            LookupError::InvalidInput => "Please enter a location.",
            LookupError::NoMatchFound(_) => "Please enter a valid location",
            LookupError::GeocodeUnavailable(_) => {
                "An error occurred while fetching the coordinates!"
            }
            LookupError::SunDataUnavailable(_) => "Error getting sunrise and sunset data.",
        };
        text.to_string()
    }

    /// Flatten an `anyhow` chain into a single cause string.
    pub(crate) fn cause(err: &anyhow::Error) -> String {
        format!("{err:#}")
    }
}
