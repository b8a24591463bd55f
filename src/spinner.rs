//! Busy indicator bracketing a submission.

use crate::view::View;

/// Handle for one attached indicator. Hidden exactly once: explicitly through
/// [`Spinner::hide`], or on drop if the owning future is abandoned.
pub struct Spinner<'a> {
    view: &'a dyn View,
    attached: bool,
}

impl<'a> Spinner<'a> {
    /// Attach the indicator, then yield once so the caller resumes at a fresh
    /// suspension point. Drawing is left to whichever layer polls the view.
    pub async fn show(view: &'a dyn View) -> Spinner<'a> {
        view.attach_spinner();
        tokio::task::yield_now().await;
        Spinner {
            view,
            attached: true,
        }
    }

    pub fn hide(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if std::mem::take(&mut self.attached) {
            self.view.detach_spinner();
        }
    }
}

impl Drop for Spinner<'_> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Document;

    #[tokio::test]
    async fn show_attaches_and_hide_detaches_once() {
        let doc = Document::new();
        let spinner = Spinner::show(&doc).await;
        assert_eq!(doc.snapshot().spinners, 1);
        spinner.hide();
        assert_eq!(doc.snapshot().spinners, 0);
    }

    #[tokio::test]
    async fn dropped_spinner_is_removed() {
        let doc = Document::new();
        {
            let _spinner = Spinner::show(&doc).await;
            assert!(doc.snapshot().is_busy());
        }
        assert!(!doc.snapshot().is_busy());
    }

    #[tokio::test]
    async fn overlapping_spinners_are_counted() {
        let doc = Document::new();
        let a = Spinner::show(&doc).await;
        let b = Spinner::show(&doc).await;
        a.hide();
        assert!(doc.snapshot().is_busy());
        b.hide();
        assert_eq!(doc.snapshot().spinners, 0);
    }
}
