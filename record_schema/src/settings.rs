//! Settings for schema parsing and validation.

/// Settings that control how schemas are read and how documents are checked.
#[derive(Debug, Clone, Default)]
pub struct ValidatorSettings {
    /// When true, strings under a known `format` (`email`, `uuid`,
    /// `date-time`) must match it. Unknown formats are never asserted.
    ///
    /// **Default: false.** `format` is an annotation unless opted in.
    pub assert_formats: bool,

    /// When true, schema documents are checked against the supported keyword
    /// subset before use, and every issue found is returned together.
    ///
    /// **Default: false (disabled).** When false, unknown keywords and
    /// keywords that do not apply to a node's `type` are silently ignored.
    pub deny_invalid_unknown_json_schema: bool,
}
