//! Thread view coordinator scenarios against the in-memory document store:
//! the lock gate, the answer toggle, the authorization boundaries, and the
//! delete cascade.

use std::sync::Arc;

use domains::{AppError, Category, Comment, NewThread, ThreadPatch, ThreadStatus, User};
use services::{tags, ThreadView, Threads};
use storage_adapters::MemoryStore;
use uuid::Uuid;

fn user(name: &str, moderator: bool) -> User {
    User {
        id: Uuid::now_v7(),
        username: name.to_string(),
        name: name.to_string(),
        email: format!("{name}@example.com"),
        is_moderator: moderator,
    }
}

fn repo() -> Threads {
    Threads::new(Arc::new(MemoryStore::new()))
}

async fn qna_thread(threads: &Threads, creator: &User) -> domains::Thread {
    threads
        .create(NewThread {
            title: "Why does my deploy hang at the health check?".into(),
            description: "Rolls out fine locally, stalls in staging.".into(),
            category: Category::CloudComputing,
            is_qna: true,
            tags: tags::normalize(["ci", "deploys"]),
            creator: creator.clone(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn creator_marks_and_unmarks_the_answer() {
    let threads = repo();
    let asker = user("asker", false);
    let helper = user("helper", false);

    let thread = qna_thread(&threads, &asker).await;
    let comment = threads
        .append_comment(thread.id, Comment::new("bump the probe timeout", helper, None))
        .await
        .unwrap();

    let mut view = ThreadView::new(threads.clone());
    view.load_thread(thread.id).await.unwrap();

    let marked = view.mark_answered(Some(&asker), comment.id).await.unwrap();
    assert!(marked.is_answered);
    assert_eq!(marked.answered_comment_id, Some(comment.id));
    assert_eq!(view.answered_comment().unwrap().id, comment.id);

    let stored = threads.get(thread.id).await.unwrap().unwrap();
    assert!(stored.is_answered);
    assert_eq!(stored.answered_comment_id, Some(comment.id));

    // Same comment again: back to the pre-mark state, not a third state.
    let unmarked = view.mark_answered(Some(&asker), comment.id).await.unwrap();
    assert!(!unmarked.is_answered);
    assert!(unmarked.answered_comment_id.is_none());

    let stored = threads.get(thread.id).await.unwrap().unwrap();
    assert!(!stored.is_answered);
    assert!(stored.answered_comment_id.is_none());
}

#[tokio::test]
async fn remarking_overwrites_without_a_confirmation_gate() {
    let threads = repo();
    let asker = user("asker", false);

    let thread = qna_thread(&threads, &asker).await;
    let first = threads
        .append_comment(thread.id, Comment::new("check DNS", user("a", false), None))
        .await
        .unwrap();
    let second = threads
        .append_comment(thread.id, Comment::new("it was the probe", user("b", false), None))
        .await
        .unwrap();

    let mut view = ThreadView::new(threads.clone());
    view.load_thread(thread.id).await.unwrap();

    view.mark_answered(Some(&asker), first.id).await.unwrap();
    let overwritten = view.mark_answered(Some(&asker), second.id).await.unwrap();
    assert_eq!(overwritten.answered_comment_id, Some(second.id));
}

#[tokio::test]
async fn moderator_cannot_mark_the_answer() {
    let threads = repo();
    let asker = user("asker", false);
    let moderator = user("mod", true);

    let thread = qna_thread(&threads, &asker).await;
    let comment = threads
        .append_comment(thread.id, Comment::new("an answer", user("c", false), None))
        .await
        .unwrap();

    let mut view = ThreadView::new(threads.clone());
    view.load_thread(thread.id).await.unwrap();

    let err = view
        .mark_answered(Some(&moderator), comment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
    assert!(!threads.get(thread.id).await.unwrap().unwrap().is_answered);
}

#[tokio::test]
async fn stranger_cannot_toggle_the_lock() {
    let threads = repo();
    let creator = user("creator", false);
    let stranger = user("stranger", false);

    let thread = qna_thread(&threads, &creator).await;
    let mut view = ThreadView::new(threads.clone());
    view.load_thread(thread.id).await.unwrap();

    let err = view.toggle_lock(Some(&stranger)).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
    assert!(!view.thread().unwrap().is_locked);
    assert!(!threads.get(thread.id).await.unwrap().unwrap().is_locked);
}

#[tokio::test]
async fn moderator_lock_closes_the_comment_gate_for_everyone() {
    let threads = repo();
    let creator = user("creator", false);
    let moderator = user("mod", true);
    let visitor = user("visitor", false);

    let thread = qna_thread(&threads, &creator).await;
    let mut view = ThreadView::new(threads.clone());
    view.load_thread(thread.id).await.unwrap();

    let locked = view.toggle_lock(Some(&moderator)).await.unwrap();
    assert!(locked.is_locked);
    assert!(threads.get(thread.id).await.unwrap().unwrap().is_locked);

    // The gate applies regardless of who attempts it, creator included.
    for principal in [&visitor, &creator, &moderator] {
        let err = view
            .submit_comment(
                Some(principal),
                Comment::new("too late", (*principal).clone(), None),
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
    assert!(view.thread().unwrap().comments.is_empty());

    // The repository write path refuses as well.
    let err = threads
        .append_comment(thread.id, Comment::new("still locked", visitor, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    // Unlocking reopens it.
    let unlocked = view.toggle_lock(Some(&moderator)).await.unwrap();
    assert!(!unlocked.is_locked);
}

#[tokio::test]
async fn signed_out_visitors_cannot_comment() {
    let threads = repo();
    let creator = user("creator", false);
    let thread = qna_thread(&threads, &creator).await;

    let mut view = ThreadView::new(threads.clone());
    view.load_thread(thread.id).await.unwrap();

    let err = view
        .submit_comment(None, Comment::new("anon", creator.clone(), None))
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn optimistic_comment_appends_before_any_reload() {
    let threads = repo();
    let creator = user("creator", false);
    let commenter = user("commenter", false);
    let thread = qna_thread(&threads, &creator).await;

    let mut view = ThreadView::new(threads.clone());
    view.load_thread(thread.id).await.unwrap();

    // The collaborator persists, the view reflects immediately.
    let comment = threads
        .append_comment(thread.id, Comment::new("seen at once", commenter.clone(), None))
        .await
        .unwrap();
    view.submit_comment(Some(&commenter), comment.clone()).unwrap();
    assert_eq!(view.thread().unwrap().comments.len(), 1);

    // A reload replaces the working set with the system of record.
    view.load_thread(thread.id).await.unwrap();
    assert_eq!(view.thread().unwrap().comments.len(), 1);
    assert_eq!(view.thread().unwrap().comments[0].id, comment.id);
}

#[tokio::test]
async fn loading_an_unknown_thread_signals_not_found() {
    let mut view = ThreadView::new(repo());
    let err = view.load_thread(Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(..)));
    assert!(view.thread().is_none());
}

#[tokio::test]
async fn turning_qna_off_clears_the_marked_answer() {
    let threads = repo();
    let asker = user("asker", false);
    let thread = qna_thread(&threads, &asker).await;
    let comment = threads
        .append_comment(thread.id, Comment::new("the fix", user("d", false), None))
        .await
        .unwrap();

    let mut view = ThreadView::new(threads.clone());
    view.load_thread(thread.id).await.unwrap();
    view.mark_answered(Some(&asker), comment.id).await.unwrap();

    let patch = ThreadPatch {
        is_qna: Some(false),
        ..ThreadPatch::default()
    };
    let edited = view.edit_thread(Some(&asker), patch).await.unwrap();
    assert!(!edited.is_qna);
    assert!(!edited.is_answered);
    assert!(edited.answered_comment_id.is_none());

    let stored = threads.get(thread.id).await.unwrap().unwrap();
    assert!(!stored.is_qna);
    assert!(!stored.is_answered);
    assert!(stored.answered_comment_id.is_none());
}

#[tokio::test]
async fn editing_retitles_and_retags() {
    let threads = repo();
    let creator = user("creator", false);
    let moderator = user("mod", true);
    let thread = qna_thread(&threads, &creator).await;

    let mut view = ThreadView::new(threads.clone());
    view.load_thread(thread.id).await.unwrap();

    let patch = ThreadPatch {
        title: Some("Deploy hangs at health check (staging only)".into()),
        category: Some(Category::SoftwareDevelopment),
        tags: Some(tags::normalize(["CI", "ci", " staging "])),
        ..ThreadPatch::default()
    };
    let edited = view.edit_thread(Some(&moderator), patch).await.unwrap();
    assert_eq!(edited.category, Category::SoftwareDevelopment);
    assert_eq!(edited.tags.len(), 2);

    let stored = threads.get(thread.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Deploy hangs at health check (staging only)");
    assert_eq!(stored.tags[1].id, "staging");
    // Untouched fields survive the partial update.
    assert!(stored.is_qna);
    assert_eq!(stored.status, Some(ThreadStatus::New));
}

#[tokio::test]
async fn deleting_removes_the_document_and_its_comments() {
    let threads = repo();
    let creator = user("creator", false);
    let thread = qna_thread(&threads, &creator).await;
    threads
        .append_comment(thread.id, Comment::new("gone with it", user("e", false), None))
        .await
        .unwrap();

    let mut view = ThreadView::new(threads.clone());
    view.load_thread(thread.id).await.unwrap();
    view.delete_thread(Some(&creator)).await.unwrap();

    assert!(view.thread().is_none());
    // Comments live inline, so the single delete is the whole cascade.
    assert!(threads.get(thread.id).await.unwrap().is_none());
}
