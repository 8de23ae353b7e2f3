//! 下单域：自动打烊时段判断与下单/改单引擎

pub mod engine;
pub mod hours;

pub use engine::OrderEngine;
