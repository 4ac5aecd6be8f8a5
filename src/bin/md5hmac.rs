use clap::{arg, Command};
use md5hmac::{hmac_md5, md5_digest, ByteBuffer};
use std::process;

fn main() {
    let matches = Command::new("md5hmac")
        .version(env!("CARGO_PKG_VERSION"))
        .about("MD5 and HMAC-MD5 digests of a file")
        .arg(arg!(--hmac <KEY> "compute HMAC-MD5 under KEY instead of plain MD5").required(false))
        .arg(arg!(<FILE> "file to digest"))
        .get_matches();

    let path = matches.get_one::<String>("FILE").expect("FILE is required");
    let buffer = match ByteBuffer::from_file(path) {
        Ok(buffer) => buffer,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let digest = match matches.get_one::<String>("hmac") {
        Some(key) => hmac_md5(key.as_bytes(), &buffer),
        None => md5_digest(buffer),
    };

    println!("{}", hex::encode_upper(digest));
}
