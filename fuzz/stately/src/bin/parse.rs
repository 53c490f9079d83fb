fn main() {
    afl::fuzz!(|data: &[u8]| {
        if let Ok(s) = std::str::from_utf8(data) {
            fuzz_stately::run_parse(s);
        }
    });
}
