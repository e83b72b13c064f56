// Feed assembly: the YML catalog document served to the marketplace.

pub mod assembler;

pub use assembler::build_feed;
