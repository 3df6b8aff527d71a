pub mod snippet_server;
