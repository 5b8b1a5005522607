pub mod plan;
pub mod run;
pub mod serve;
pub mod validate;
