// =-=-= lib.rs =-=-=
// Core routines and API for aazip

pub mod bwt;
pub mod lupdate;
pub mod sort;

mod huffman;
mod out;

use out::OutputStream;

use std::convert;
use std::fs;
use std::io;
use std::path;

pub use lupdate::Algorithm;

/// What one compression run did.
#[derive(Debug)]
pub struct Summary {
    pub input_bytes: usize,
    pub output_bytes: u64,
    /// Accumulated list-update access cost.
    pub cost: u64,
    /// BWT rotation index stored in the container.
    pub primary_index: u32,
}

/// Compress `input` and write the aazip container to `writer`.
///
/// The pipeline is BWT over a deep-shallow suffix array, list-update
/// recoding under `alg`, then canonical Huffman coding of the rank stream.
///
/// Empty inputs are refused with `InvalidInput`.
///
/// Returns a [`Summary`] of the run.
pub fn encode<W>(input: &[u8], writer: W, alg: Algorithm) -> io::Result<Summary>
where
    W: io::Write,
{
    if input.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "refusing to compress an empty input",
        ));
    }

    let bwt_out = bwt::transform(input);
    let recoded = lupdate::recode(alg, &bwt_out.bwt);

    let mut output = OutputStream::new(writer);
    output.write_bytes(b"AA")?;
    output.write_u32_le(bwt_out.index)?;
    output.write_byte(alg.mode_byte())?;

    huffman::encode(&mut output, &recoded.output)?;
    let output_bytes = output.close()?;

    Ok(Summary {
        input_bytes: input.len(),
        output_bytes,
        cost: recoded.cost,
        primary_index: bwt_out.index,
    })
}

/// Compress a file into another file.
///
/// Use [`encode`] instead if you want control over the output stream.
pub fn encode_file<I, O>(in_path: I, out_path: O, alg: Algorithm) -> io::Result<Summary>
where
    I: convert::AsRef<path::Path>,
    O: convert::AsRef<path::Path>,
{
    let input = fs::read(in_path.as_ref())?;
    let outf = fs::File::create(out_path.as_ref())?;

    encode(&input, io::BufWriter::new(outf), alg)
}
