use crate::HtmlParserProvider;
use crate::editing::EditingCapabilities;
use hilite_traits::{ShellProvider, Viewport};
use std::sync::Arc;

/// Options used when constructing a [`BaseDocument`](crate::BaseDocument)
#[derive(Default)]
pub struct DocumentConfig {
    /// The initial `Viewport`
    pub viewport: Option<Viewport>,
    /// Which native editing commands the host supports, and how it paints them.
    /// Defaults to an immediate `hiliteColor` command.
    pub capabilities: Option<EditingCapabilities>,
    /// Shell provider to redraw requests, toasts, etc
    pub shell_provider: Option<Arc<dyn ShellProvider>>,
    /// HTML parser provider. Used to parse HTML for setInnerHTML
    pub html_parser_provider: Option<Arc<dyn HtmlParserProvider>>,
}
