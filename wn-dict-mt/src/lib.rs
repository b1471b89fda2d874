//! Tagged placeholder resolution for machine-translated content
//!
//! Dictionary terms in a chapter are replaced by placeholder spans before an
//! external page translator runs. Once the translator has finished with a
//! line, which is only detectable through the boundary markers around it,
//! each placeholder is swapped for the dictionary translation and annotated
//! with the entry's comment.
//!
//! # Workflow Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wn_dict::{CompilerConfig, Dictionary};
//! use wn_dict_mt::{
//!     ExternalConfig, ExternalTranslation, MockMode, MockTranslator, tag_document,
//!     translate_document,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Compile the dictionary
//!     let dictionary = Dictionary::from_source("長老 --> Elder", &CompilerConfig::default());
//!
//!     // 2. Tag the chapter text
//!     let document = tag_document("長老が来た", &dictionary);
//!
//!     // 3. Let the external translator loose and resolve what stabilises
//!     let external = ExternalTranslation::new(
//!         Arc::new(MockTranslator::new(MockMode::Uppercase)),
//!         ExternalConfig::default(),
//!     );
//!     let report = translate_document(document, dictionary.mapping(), &external).await?;
//!
//!     println!("{}", report.document.text());
//!     Ok(())
//! }
//! ```

pub mod annotation;
pub mod checkpoint;
pub mod content;
pub mod error;
pub mod external;
pub mod mock;
pub mod resolver;
pub mod session;
pub mod tagging;
pub mod translator;


// Re-export main types for convenient access
pub use annotation::{Annotations, Placement, Popover, Trigger};
pub use checkpoint::{CheckpointTracker, ObserveOutcome, StabilizationHandler};
pub use content::{Document, Inline, PLACEHOLDER_TEXT, Unit};
pub use error::{MtError, MtResult};
pub use external::{ChunkOrder, DocumentEvent, ExternalConfig, ExternalTranslation};
pub use mock::{MockMode, MockTranslator};
pub use resolver::{PlaceholderResolver, ResolvingHandler};
pub use session::{EVENT_BUFFER, Session, SessionReport, translate_document};
pub use tagging::{tag_document, tag_line};
pub use translator::{MachineTranslator, normalize_locale, validate_locale};
