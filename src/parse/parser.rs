/// One non-blank, non-comment line of input, split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub line_number: usize,
    pub fields: Vec<String>,
}
