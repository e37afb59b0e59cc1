fn main() {
    cargo_run_wasm::run_wasm_cli_with_css("body { margin: 0px; }");
}
