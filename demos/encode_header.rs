//! Encode a template file and print it as a C header.
//!
//! Run with: cargo run --example encode_header

use std::error::Error;
use xftmpl::{decode, encode_slice, EncodeOptions, Token};

const TEMPLATES: &str = "xof 0302txt 0064
#pragma xftmpl name vector_templates
#pragma xftmpl size VECTOR_TEMPLATES_SIZE

template Vector {
    <3D82AB5E-62DA-11cf-AB39-0020AF71E433>
    FLOAT x;
    FLOAT y;
    FLOAT z;
}

template Coords2d {
    <F6F23F44-7686-11cf-8F52-0040333594A3>
    FLOAT u;
    FLOAT v;
}
";

fn main() -> Result<(), Box<dyn Error>> {
    let encoded = encode_slice(TEMPLATES.as_bytes(), &EncodeOptions::new())?;
    println!(
        "Encoded {} bytes of text into {} bytes\n",
        TEMPLATES.len(),
        encoded.len()
    );

    // Inspect the token stream
    let tokens = decode(&encoded.bytes)?.tokens;
    let names: Vec<String> = tokens
        .iter()
        .filter_map(|token| match token {
            Token::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        })
        .collect();
    println!("{} tokens, names: {}\n", tokens.len(), names.join(", "));

    // Render the C header the way the build embeds it
    let mut header = Vec::new();
    encoded.write_c_header(&mut header, "vector.x", "vector_templates.h")?;
    print!("{}", String::from_utf8(header)?);

    Ok(())
}
