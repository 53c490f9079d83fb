use fuzz_stately::Input;

fn main() {
    afl::fuzz!(|data: Input| data.run_differential());
}
