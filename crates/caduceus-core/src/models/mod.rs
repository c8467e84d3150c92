pub mod citation;
pub mod encounter;
pub mod flag;
pub mod report;
pub mod scenario;
pub mod source;
