fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Only compile the wire schema when the grpc transport is enabled
    #[cfg(feature = "grpc")]
    {
        // Use protoc-bin-vendored to avoid needing protoc installed
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path().unwrap());

        // The server side is compiled too: integration tests exercise the
        // client against an in-process fixture server.
        tonic_build::configure()
            .build_client(true)
            .build_server(true)
            .compile_protos(&["proto/tei.proto"], &["proto"])?;

        println!("cargo:rerun-if-changed=proto/tei.proto");
    }

    println!("cargo:rerun-if-changed=build.rs");

    Ok(())
}
