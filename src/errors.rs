// Create the Error, ErrorKind, ResultExt, and Result types.
// Result is a typedef of std `Result` with the error type our own `Error`.
// Defines the From conversions that let `?` work for our `Error`.
use error_chain::*;

error_chain! {

    errors {
        InvalidDimensions(width: usize, height: usize) {
            description("invalid maze dimensions")
            display("invalid maze dimensions {}x{}, width and height must both be at least 1", width, height)
        }

        ImageTooLarge(width: usize, height: usize, cell_pixels: u32) {
            description("maze image too large")
            display("a {}x{} maze at {} pixels per cell does not fit in an image", width, height, cell_pixels)
        }
    }
}
