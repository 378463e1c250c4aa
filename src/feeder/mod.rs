/*!
 * Live Input Feeding
 *
 * Turns newline-delimited text into command tokens:
 * - `LiveFeeder`: background thread pumping a live line source into a channel
 * - `tokenize_line` / `load_script`: whitespace tokenization for lines and
 *   script files
 */

mod live;
mod script;

pub use live::LiveFeeder;
pub use script::{load_script, load_script_file, tokenize_line};
