use huffman_codebook::{huffman, Codebook};

fn main() -> huffman_codebook::Result<()> {
    let s = String::from("Hello my name is Sam!");
    let tree = huffman(s.bytes())?;
    print!("{}", Codebook::from_tree(&tree));

    let (e, d) = tree.into_encoder_decoder_pair();
    let out = e.encode(s.bytes())?;
    let dec = String::from_utf8(d.decode_bits(&out)?);

    println!("{} bits: {:?}", out.len(), dec);
    Ok(())
}
