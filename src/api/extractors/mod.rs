/*!
 * Request extractors
 *
 * Responsibility:
 * - middleware が request extensions に載せた値を handler に提供する
 *
 * Public API:
 * - Visualizations / VisualizationItem (augment middleware の結果)
 * - Session (session middleware のハンドル)
 */

mod augmented;
mod session;

pub use augmented::{VisualizationItem, Visualizations};
