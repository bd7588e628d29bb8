/// The configuration object could not be decoded
#[derive(Debug)]
pub struct OptionsError(pub serde_json::Error);

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid loader options: {}", self.0)
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serde_json::Error> for OptionsError {
    fn from(value: serde_json::Error) -> Self {
        OptionsError(value)
    }
}
