use rust_xlsxwriter::{Format, FormatAlign};

/// Bold header row
pub fn create_header_format() -> Format {
    Format::new().set_bold()
}

/// Entity name cell merged across several difference rows
pub fn create_merged_name_format() -> Format {
    Format::new().set_align(FormatAlign::VerticalCenter)
}
