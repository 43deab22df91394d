//! Provider backend modules. One module per backend; the enum in
//! [`crate::llm`] is the only public dispatch surface.

pub mod dummy;
pub mod gemini;
