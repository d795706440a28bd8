//! Translation adapter and span translation
//!
//! [`Translator`] is the narrow external boundary — any backend with a
//! `translate(text, target_lang) -> text` shape plugs in. The span
//! translator applies the short-circuit and drop policies on top.

mod provider;
mod session;
mod spans;

pub use provider::{HttpTranslator, IdentityTranslator, Translator};
pub use session::{LanguageSession, SessionCache};
pub use spans::translate_spans;
