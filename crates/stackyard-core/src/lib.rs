//! Stackyard コア
//!
//! サービスレコードから docker compose マニフェストを生成するための
//! データモデルとトポロジジェネレータを提供します。
//! 外部プロセスの実行やファイル書き込みは行いません（`stackyard-runtime` の責務）。

pub mod error;
pub mod model;
pub mod topology;

pub use error::*;
pub use model::*;
pub use topology::*;
