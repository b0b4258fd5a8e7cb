// src/script/decoder.rs

//! Turns one script line into one `Operation`.
//!
//! Grammar, whitespace separated:
//!
//! ```text
//! white | green | update | reset
//! bgrect <x1> <y1> <x2> <y2>
//! figure <x> <y>
//! move <x> <y>
//! ```
//!
//! Numeric arguments are fractions of the surface size and must lie in `[0, 1]`.

use log::trace;

use crate::color::NamedColor;
use crate::painter::{Operation, Point, Rect};
use crate::script::error::DecodeError;

/// Decodes a single line. Checks, in order: the command is known, the
/// argument count matches, every argument is a number, every number is in
/// `[0, 1]`.
pub fn decode(line: &str) -> Result<Operation, DecodeError> {
    let mut tokens = line.split_whitespace();
    let command = tokens.next().unwrap_or_default();
    let args: Vec<&str> = tokens.collect();

    let op = match command {
        "white" => {
            fractions::<0>("white", &args)?;
            Operation::Fill(NamedColor::White.to_color())
        }
        "green" => {
            fractions::<0>("green", &args)?;
            Operation::Fill(NamedColor::Green.to_color())
        }
        "update" => {
            fractions::<0>("update", &args)?;
            Operation::Commit
        }
        "reset" => {
            fractions::<0>("reset", &args)?;
            Operation::Reset
        }
        "bgrect" => {
            let [x1, y1, x2, y2] = fractions::<4>("bgrect", &args)?;
            Operation::BackgroundRect(Rect::new(x1, y1, x2, y2))
        }
        "figure" => {
            let [x, y] = fractions::<2>("figure", &args)?;
            Operation::FigureAdd(Point::new(x, y))
        }
        "move" => {
            let [x, y] = fractions::<2>("move", &args)?;
            Operation::MoveAll(Point::new(x, y))
        }
        other => {
            return Err(DecodeError::UnknownCommand {
                command: other.to_string(),
            })
        }
    };

    trace!("decode: {:?} -> {:?}", line, op);
    Ok(op)
}

/// Parses exactly `N` arguments as fractions in `[0, 1]`.
fn fractions<const N: usize>(
    command: &'static str,
    args: &[&str],
) -> Result<[f32; N], DecodeError> {
    if args.len() != N {
        return Err(DecodeError::WrongArgumentCount {
            command,
            expected: N,
            found: args.len(),
        });
    }

    let mut values = [0.0f32; N];
    for (slot, arg) in values.iter_mut().zip(args) {
        // Rounded to f32 before the range check; NaN fails the check too.
        let value: f32 = arg.parse().map_err(|_| DecodeError::NonNumericArgument {
            command,
            argument: arg.to_string(),
        })?;
        if !(0.0..=1.0).contains(&value) {
            return Err(DecodeError::OutOfRangeArgument { command, value });
        }
        *slot = value;
    }
    Ok(values)
}
