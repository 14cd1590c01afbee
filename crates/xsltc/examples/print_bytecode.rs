use xsltc::compiler::compile_call;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: print_bytecode <call>");
        std::process::exit(2);
    }
    let src = &args[1];
    match compile_call(src) {
        Ok((method, class_gen)) => {
            println!("{} -> {} (max stack {})", method.source, method.result_type, method.max_stack);
            println!("{}", method.instrs.disassemble(class_gen.constant_pool()));
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
