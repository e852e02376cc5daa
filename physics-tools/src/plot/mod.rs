pub mod band;
pub mod svg;
pub mod terminal;
