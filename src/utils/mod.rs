pub mod clock;
pub mod date;
pub mod path;
pub mod table;
