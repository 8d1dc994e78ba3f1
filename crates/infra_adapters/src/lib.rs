//! Infrastructure Adapters
//!
//! Implementations of the claims domain ports that talk to the outside
//! world: the file system, Slack, and an HTTP vision model.
//!
//! | Port | Adapter |
//! |------|---------|
//! | `DocumentStore` | [`PdfDocumentStore`] |
//! | `Notifier` | [`SlackNotifier`], [`EmailNotifier`], [`CompositeNotifier`] |
//! | `Classifier` | [`HttpVisionClassifier`] |

pub mod pdf;
pub mod notify;
pub mod vision;

pub use pdf::PdfDocumentStore;
pub use notify::{CompositeNotifier, EmailNotifier, SlackNotifier};
pub use vision::HttpVisionClassifier;
