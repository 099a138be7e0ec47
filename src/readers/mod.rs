pub mod line_parser;

pub use line_parser::{parse_observation_line, LineRejection};
