use std::fs;
use std::io;
use std::path::Path;

pub const PREAMBLE: &str = r#"#include <iostream>
#include <string>
#include <fstream>
#include "Builtins.hpp"

"#;

pub const BUILTINS_HEADER_NAME: &str = "Builtins.hpp";
pub const BUILTINS_SOURCE_NAME: &str = "Builtins.cpp";

pub const BUILTINS_HEADER: &str = r#"#ifndef BUILTINS_HPP
#define BUILTINS_HPP

#include <string>

// Reads an entire file into a string.
std::string readFile(const std::string &filename);

// Writes the provided content into a file.
void writeFile(const std::string &filename, const std::string &content);

#endif // BUILTINS_HPP
"#;

pub const BUILTINS_SOURCE: &str = r#"#include "Builtins.hpp"
#include <fstream>
#include <sstream>
#include <stdexcept>

std::string readFile(const std::string &filename) {
    std::ifstream file(filename);
    if (!file) {
        throw std::runtime_error("Could not open file: " + filename);
    }
    std::stringstream buffer;
    buffer << file.rdbuf();
    return buffer.str();
}

void writeFile(const std::string &filename, const std::string &content) {
    std::ofstream file(filename);
    if (!file) {
        throw std::runtime_error("Could not write to file: " + filename);
    }
    file << content;
}
"#;

/// Writes `Builtins.hpp` and `Builtins.cpp` into `dir`.
pub fn write_runtime_files(dir: &Path) -> io::Result<()> {
    fs::write(dir.join(BUILTINS_HEADER_NAME), BUILTINS_HEADER)?;
    fs::write(dir.join(BUILTINS_SOURCE_NAME), BUILTINS_SOURCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_both_runtime_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_runtime_files(dir.path()).expect("write failed");
        let header = fs::read_to_string(dir.path().join("Builtins.hpp")).expect("header");
        let source = fs::read_to_string(dir.path().join("Builtins.cpp")).expect("source");
        assert_eq!(header, BUILTINS_HEADER);
        assert!(source.contains("Could not open file: "));
        assert!(PREAMBLE.ends_with("\"Builtins.hpp\"\n\n"));
    }
}
