pub mod open;
pub mod report;
pub mod resource;
pub mod serve;
