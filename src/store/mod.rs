pub mod cipher_file;
