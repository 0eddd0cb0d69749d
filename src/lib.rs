/*!
 * # mtbatch - resilient batch machine translation
 *
 * A Rust library for translating documents and spreadsheet cells with
 * chat language models, backed by a direct machine-translation engine.
 *
 * ## Features
 *
 * - Line-preserving segmentation with per-language "needs translation" rules
 * - Token-budgeted chunking with concurrent, order-preserving dispatch
 * - Shrinking-chunk retry ladder with fallback to a direct MT engine
 * - Translation memory seeding few-shot examples and pinning terminology
 * - Post-edit guard for `{n}`, `[color=#RRGGBB]` and `[b]` placeholders,
 *   Roman numerals and sentence case
 * - Translation engines:
 *   - OpenAI chat completion (OpenAI API or Azure deployment)
 *   - Google Cloud Translation v2
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `segmenter`: Document segmentation and reassembly
 * - `tokens`: Token cost estimation for chunk sizing
 * - `memory`: Translation memory index and corpus loading
 * - `translation`: The batch pipeline:
 *   - `translation::core`: `TranslationService` entry points
 *   - `translation::batch`: Chunk rounds, retry ladder and fallback
 *   - `translation::registry`: Engines by name
 * - `post_edit`: Placeholder guard and stylistic corrections
 * - `language_utils`: ISO language code utilities
 * - `providers`: Engine interfaces and clients:
 *   - `providers::openai`: OpenAI chat client
 *   - `providers::google`: Google Translate client
 *   - `providers::mock`: Scripted backends for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod language_utils;
pub mod memory;
pub mod post_edit;
pub mod providers;
pub mod segmenter;
pub mod tokens;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, FailureReason, ProviderError, TranslationError};
pub use language_utils::{closest_supported_match, get_language_name, language_codes_match};
pub use memory::{TmTable, TranslationMemory};
pub use post_edit::PostEditor;
pub use translation::{BatchOptions, BatchTranslator, TranslationService, FAILURE_MARKER};
