pub mod parser;

pub use parser::{InputFormat, load_points, parse_points};
