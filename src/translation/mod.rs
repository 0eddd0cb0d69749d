/*!
 * Resilient batch translation.
 *
 * This module contains the translation pipeline built on top of the
 * providers. It is split into several submodules:
 *
 * - `core`: `TranslationService`, the document and cell entry points
 * - `batch`: LLM batch translator with retry ladder and fallback
 * - `chunker`: token-budgeted, order-preserving chunking
 * - `prompts`: system, few-shot and source prompts
 * - `response`: reply-to-unit alignment and numbering fix-up
 * - `registry`: engines by name
 */

// Re-export main types for easier usage
pub use self::batch::{BatchOptions, BatchTranslator, UnitResult, FAILURE_MARKER};
pub use self::chunker::Chunk;
pub use self::core::TranslationService;
pub use self::registry::EngineRegistry;

// Submodules
pub mod batch;
pub mod chunker;
pub mod core;
pub mod prompts;
pub mod registry;
pub mod response;
