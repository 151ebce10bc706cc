//! モデル定義
//!
//! マニフェスト、サービスレコード、テンプレートの各モデルを定義します。

mod manifest;
mod record;
mod restart;
mod template;

// Re-exports
pub use manifest::*;
pub use record::*;
pub use restart::*;
pub use template::*;
