use huffman_codebook::bits::{BitReader, BitWriter};
use huffman_codebook::{huffman, Codebook, Error};
use std::env;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};

fn main() -> huffman_codebook::Result<()> {
    let Some(fp) = env::args().nth(1) else {
        eprintln!("Please provide path to input file as first argument.");
        std::process::exit(2);
    };

    let input_bytes = fs::read(&fp)?;
    let code_path = format!("{fp}.code");
    let data_path = format!("{fp}.huf");

    // encode scope - codebook as text, bits packed behind a length header
    {
        let tree = huffman(input_bytes.iter().copied())?;
        Codebook::from_tree(&tree).write_to(BufWriter::new(File::create(&code_path)?))?;

        let (e, _) = tree.into_encoder_decoder_pair();
        let mut body = BitWriter::new(Vec::new());
        e.encode_into(input_bytes.iter().copied(), &mut body)?;
        let (packed, bit_len) = body.finish()?;

        let mut out = BufWriter::new(File::create(&data_path)?);
        out.write_all(&bit_len.to_be_bytes())?;
        out.write_all(&packed)?;
        out.flush()?;
    }

    // decode scope - read both files back
    {
        let book = Codebook::<u8>::read_from(BufReader::new(File::open(&code_path)?))?;
        let (_, d) = book.into_tree()?.into_encoder_decoder_pair();

        let mut data = BufReader::new(File::open(&data_path)?);
        let mut header = [0u8; 8];
        data.read_exact(&mut header)?;
        let decoded = d.decode(BitReader::with_len(data, u64::from_be_bytes(header)))?;

        if decoded != input_bytes {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "decoded output differs from input",
            )));
        }
    }

    println!("wrote {code_path} and {data_path}");
    Ok(())
}
