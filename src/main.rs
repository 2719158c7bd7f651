fn main() {
    rawfetch::cli::run();
}
