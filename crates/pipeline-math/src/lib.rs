pub mod broadcast;
pub mod interp;
pub mod table;
