use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one, inject dependencies,
/// and ensure that the test's SQLite file is deleted regardless of how the test
/// terminates.
///
/// Injectable dependencies are [`rocket::local::asynchronous::Client`] and
/// [`sqlx::SqlitePool`]. Both talk to the same fresh store, seeded with the
/// default candidates.
///
/// `#[backend_test(voter)]` additionally registers and logs in the example
/// voter through the client before the test body runs.
#[proc_macro_attribute]
pub fn backend_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract type information and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Log the client in as a voter if needed.
    let maybe_login = match parse_macro_input!(args as Option<Ident>) {
        None => quote! {},
        Some(arg) if arg == "voter" => quote! {
            let registration = crate::model::api::auth::Registration::example();
            rocket_client
                .post("/register")
                .header(rocket::http::ContentType::Form)
                .body(registration.to_form_body())
                .dispatch()
                .await;

            let credentials = crate::model::api::auth::Credentials::example();
            rocket_client
                .post("/login")
                .header(rocket::http::ContentType::Form)
                .body(credentials.to_form_body())
                .dispatch()
                .await;

            assert!(
                rocket_client.cookies().get(crate::model::auth::AUTH_TOKEN_COOKIE).is_some(),
                "example voter failed to log in during test setup"
            );
        },
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected no argument or `voter`")
                .into_compile_error()
                .into();
        }
    };

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// Test setup.
            async fn setup() -> (rocket::local::asynchronous::Client, sqlx::SqlitePool, std::path::PathBuf) {
                log4rs_test_utils::test_logging::init_logging_once_for(["votebox"], None, None);

                let db_path = std::env::temp_dir()
                    .join(format!("votebox-test-{}.db", rand::random::<u64>()));
                let db = crate::model::sqlite::open(&db_path, &crate::model::sqlite::DEFAULT_CANDIDATES)
                    .await
                    .unwrap();
                let rocket_client = rocket::local::asynchronous::Client::tracked(crate::rocket_for_pool(db.clone()))
                    .await
                    .unwrap();

                #maybe_login

                (rocket_client, db, db_path)
            }

            /// The test itself.
            #item_fn

            /// Test cleanup.
            async fn cleanup(db: sqlx::SqlitePool, db_path: std::path::PathBuf) {
                db.close().await;
                for suffix in ["", "-wal", "-shm"] {
                    let mut path = db_path.clone().into_os_string();
                    path.push(suffix);
                    // Not every suffix exists in every journal mode.
                    let _ = std::fs::remove_file(path);
                }
            }

            // Create an async runtime. We need a separate one for inside and
            // outside the `catch_unwind`.
            let outer_runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("test-setup-cleanup")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();
            let inner_runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            // Run the setup.
            let (rocket_client, db, db_path) = outer_runtime.block_on(setup());

            // Run the test, catching any panics.
            // Use mutexes to safely transfer `!UnwindSafe` data.
            let client_mutex = std::sync::Mutex::new(rocket_client);
            let db_mutex = std::sync::Mutex::new(db.clone());
            let runtime_mutex = std::sync::Mutex::new(inner_runtime);
            let result = std::panic::catch_unwind(|| {
                #[allow(unused_variables)]
                let rocket_client = client_mutex.into_inner().unwrap();
                #[allow(unused_variables)]
                let db = db_mutex.into_inner().unwrap();
                let runtime = runtime_mutex.into_inner().unwrap();

                runtime.block_on(#new_name(#(#test_args),*));
            });

            // Run the cleanup.
            outer_runtime.block_on(cleanup(db, db_path));

            // If the test panicked, re-raise the panic.
            if let Err(cause) = result {
                std::panic::panic_any(cause);
            }
        }
    }
    .into()
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_client = false;
    let mut has_db = false;
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let Pat::Ident(_) = &*pat_type.pat {
                if let Type::Path(type_path) = &*pat_type.ty {
                    if let Some(type_ident) = type_path.path.segments.last().map(|s| &s.ident) {
                        if type_ident == "Client" {
                            if has_client {
                                return Err(syn::Error::new(input.span(), "Test cannot accept more than one `rocket::local::asynchronous::Client`"));
                            }
                            has_client = true;
                            args.push(quote! { rocket_client });
                            continue;
                        } else if type_ident == "SqlitePool" {
                            if has_db {
                                return Err(syn::Error::new(
                                    input.span(),
                                    "Test cannot accept more than one `sqlx::SqlitePool`",
                                ));
                            }
                            has_db = true;
                            args.push(quote! { db });
                            continue;
                        }
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `client_ident: Client` or `db_ident: SqlitePool`",
        ));
    }

    Ok(args)
}
