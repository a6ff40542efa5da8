pub mod generate_content;
