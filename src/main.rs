fn main() {
    aerial_clustering::cli::run();
}
