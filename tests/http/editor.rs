use book_catalog::{BookForm, CatalogEditor, EditorMode, InMemoryGateway};

use crate::support::{dune, emma, http_gateway, start_server};

#[tokio::test]
async fn full_editing_session_over_http() {
    let backend = InMemoryGateway::with_books(vec![dune()]);
    let base = start_server(backend.clone()).await;
    let editor = CatalogEditor::new(http_gateway(&base));

    editor.refresh().await.unwrap();
    assert_eq!(editor.books().unwrap(), vec![dune()]);

    // create
    editor
        .submit_form(BookForm::new("Emma", "Austen", "1815"))
        .await
        .unwrap();
    assert_eq!(editor.books().unwrap(), vec![dune(), emma()]);

    // edit
    editor.begin_edit(0).unwrap();
    let mut form = editor.form().unwrap();
    form.title = "Dune Messiah".into();
    form.year = "1969".into();
    editor.submit_form(form).await.unwrap();
    assert_eq!(editor.mode().unwrap(), EditorMode::Browsing);
    assert_eq!(editor.books().unwrap()[0].title, "Dune Messiah");

    // search
    editor.set_search("messiah").unwrap();
    assert_eq!(editor.visible().unwrap().len(), 1);

    // delete
    editor.delete_at(1).await.unwrap();
    assert_eq!(editor.books().unwrap().len(), 1);
    assert_eq!(backend.snapshot(), editor.books().unwrap());
}

#[tokio::test]
async fn refetch_picks_up_changes_from_other_clients() {
    let backend = InMemoryGateway::new();
    let base = start_server(backend.clone()).await;
    let ours = CatalogEditor::new(http_gateway(&base));
    let theirs = CatalogEditor::new(http_gateway(&base));

    theirs
        .submit_form(BookForm::new("Dune", "Herbert", "1965"))
        .await
        .unwrap();

    // our create is followed by a refetch, which brings in their book too
    ours.submit_form(BookForm::new("Emma", "Austen", "1815"))
        .await
        .unwrap();
    assert_eq!(ours.books().unwrap(), vec![dune(), emma()]);
}
