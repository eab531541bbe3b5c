//! Paginated PDF output.
//!
//! [`layout`] drives pre-measured block drawing over [`writer`], which
//! assembles the final document from per-page [`content_stream`] operator
//! sequences. [`fonts`] supplies the Base-14 metrics the measurement pass
//! relies on; [`winansi`] keeps show-text strings single-byte.

pub mod content_stream;
pub mod fonts;
pub mod layout;
pub mod objects;
pub mod winansi;
pub mod writer;

pub use layout::{LayoutContext, ReportRenderer};
pub use writer::{PdfWriter, WriterConfig};
