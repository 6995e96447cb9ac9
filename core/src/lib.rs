pub mod engine;
pub mod evaluate;
pub mod health;
pub mod probe;
pub mod sink;
pub mod source;
pub mod worker;
