pub mod reader;
pub mod template;

pub use reader::{
    parse_sheet,
    read_sheet,
    RawCell,
    RawSheet,
    SheetFormat,
};
pub use template::{
    build_template,
    save_template,
    TemplateStyle,
    DEFAULT_TEMPLATE_NAME,
};
