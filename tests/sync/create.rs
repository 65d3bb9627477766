use book_catalog::{
    Book, BookForm, CatalogEditor, EditorError, EditorMode, FormError, GatewayOperation,
    InMemoryGateway, SubmitOutcome,
};

use crate::support::{dune, emma, ScriptedGateway};

#[tokio::test]
async fn create_appends_response_then_refetches() {
    let created = Book::new("X", "Y", 2000).with_id(7);
    let server_list = vec![dune(), created.clone(), emma()];
    let gateway = ScriptedGateway::new()
        .list_ok(vec![dune()])
        .create_ok(created.clone())
        .list_ok(server_list.clone());
    let editor = CatalogEditor::new(gateway);
    editor.refresh().await.unwrap();

    let outcome = editor
        .submit_form(BookForm::new("X", "Y", "2000"))
        .await
        .unwrap();

    assert_eq!(outcome, SubmitOutcome::Created(created));
    // refetch overwrote the appended state with the server's list
    assert_eq!(editor.books().unwrap(), server_list);
    assert_eq!(
        editor.gateway().log(),
        vec![
            "list".to_string(),
            r#"create {"title":"X","author":"Y","year":2000}"#.to_string(),
            "list".to_string(),
        ]
    );
}

#[tokio::test]
async fn create_keeps_appended_book_when_refetch_fails() {
    let created = Book::new("X", "Y", 2000).with_id(7);
    let gateway = ScriptedGateway::new()
        .list_ok(vec![dune()])
        .create_ok(created.clone())
        .list_err();
    let editor = CatalogEditor::new(gateway);
    editor.refresh().await.unwrap();

    editor
        .submit_form(BookForm::new("X", "Y", "2000"))
        .await
        .unwrap();

    let books = editor.books().unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books.last(), Some(&created));
}

#[tokio::test]
async fn catalog_follows_response_not_submission() {
    // server normalizes the title
    let gateway = ScriptedGateway::new()
        .create_ok(Book::new("Dune", "Frank Herbert", 1965).with_id(1))
        .list_err();
    let editor = CatalogEditor::new(gateway);

    editor
        .submit_form(BookForm::new("  dune ", "frank herbert", "1965"))
        .await
        .unwrap();

    assert_eq!(
        editor.books().unwrap(),
        vec![Book::new("Dune", "Frank Herbert", 1965).with_id(1)]
    );
}

#[tokio::test]
async fn successful_create_clears_form() {
    let editor = CatalogEditor::new(InMemoryGateway::new());
    editor
        .submit_form(BookForm::new("Dune", "Herbert", "1965"))
        .await
        .unwrap();

    assert!(editor.form().unwrap().is_blank());
    assert_eq!(editor.mode().unwrap(), EditorMode::Browsing);
    assert_eq!(editor.books().unwrap(), vec![dune()]);
}

#[tokio::test]
async fn failed_create_keeps_form_and_catalog() {
    let gateway = ScriptedGateway::new().list_ok(vec![dune()]).create_err();
    let editor = CatalogEditor::new(gateway);
    editor.refresh().await.unwrap();

    let form = BookForm::new("X", "Y", "2000");
    let err = editor.submit_form(form.clone()).await.unwrap_err();

    assert_eq!(
        err.as_gateway().map(|e| e.operation),
        Some(GatewayOperation::Create)
    );
    assert_eq!(editor.form().unwrap(), form);
    assert_eq!(editor.books().unwrap(), vec![dune()]);
    // no refetch after a failed create
    assert_eq!(editor.gateway().log().len(), 2);
}

#[tokio::test]
async fn unparseable_year_never_reaches_gateway() {
    let gateway = InMemoryGateway::new();
    let editor = CatalogEditor::new(gateway.clone());

    let err = editor
        .submit_form(BookForm::new("Dune", "Herbert", "soon"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EditorError::InvalidForm(FormError::InvalidYear("soon".into()))
    );
    assert_eq!(gateway.calls(GatewayOperation::Create), 0);
    assert_eq!(editor.form().unwrap().year, "soon");
}
