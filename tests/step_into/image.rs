use stepseer::debugger::disasm::image::ImageDisassembler;
use stepseer::debugger::source::FsSource;
use stepseer::debugger::{NameRegistry, StepIntoResolver};

const SOURCE: &str = r#"package main

func main() {
	z := f(g(x), h(y))
	_ = z
}
"#;

fn image() -> ImageDisassembler {
    let mut code = vec![
        // call main.g
        0xe8, 0xfb, 0x00, 0x00, 0x00, //
        // call main.h
        0xe8, 0xf6, 0x01, 0x00, 0x00, //
        // call main.f
        0xe8, 0xf1, 0x02, 0x00, 0x00, //
        // ret
        0xc3,
    ];
    code.resize(0x400, 0xc3);

    let mut image = ImageDisassembler::new(0x401000, code).unwrap();
    image.add_symbol("main.main", 0x401000);
    image.add_symbol("main.g", 0x401100);
    image.add_symbol("main.h", 0x401200);
    image.add_symbol("main.f", 0x401300);
    image.add_line("main.go", 4, 0x401000..0x40100f);
    image.add_line("main.go", 5, 0x40100f..0x401010);
    image
}

#[test]
fn test_resolve_over_code_image() {
    let dir = std::env::temp_dir().join(format!("seer-image-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("main.go"), SOURCE).unwrap();

    let functions: NameRegistry = ["main.f", "main.g", "main.h", "main.main"]
        .into_iter()
        .collect();
    let mut resolver = StepIntoResolver::new(
        FsSource::with_root(&dir),
        image(),
        NameRegistry::new(),
        functions,
    );

    let g = resolver.resolve(0x401000, "main.go", 4, 9).unwrap();
    assert_eq!(g.name(), "main.g");
    assert_eq!(g.instruction().pc, 0x401000);
    assert!(g.instruction().at_pc);

    let f = resolver.resolve(0x401005, "main.go", 4, 7).unwrap();
    assert_eq!(f.name(), "main.f");
    assert_eq!(f.instruction().pc, 0x40100a);
    assert!(!f.instruction().at_pc);

    assert!(resolver.resolve(0x401005, "main.go", 4, 9).is_none());

    std::fs::remove_dir_all(&dir).unwrap();
}
