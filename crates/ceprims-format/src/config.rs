/// Controls how the JSON format places the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonFormatConfig {
    /// When true, `data` is always written as `data_base64`, even for JSON payloads.
    pub force_data_base64: bool,
}
