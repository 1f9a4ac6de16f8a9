use super::CardView;

#[derive(Debug, Clone, PartialEq)]
pub enum ModalContent {
    Preview(CardView),
    Basket,
    Order,
    Contacts,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Preview,
    Basket,
    Order,
    Contacts,
    Success,
}

impl ModalContent {
    pub fn kind(&self) -> ModalKind {
        match self {
            ModalContent::Preview(_) => ModalKind::Preview,
            ModalContent::Basket => ModalKind::Basket,
            ModalContent::Order => ModalKind::Order,
            ModalContent::Contacts => ModalKind::Contacts,
            ModalContent::Success => ModalKind::Success,
        }
    }
}

/// Holds whichever view is mounted into the modal, if any.
#[derive(Debug, Default)]
pub struct ModalHost {
    content: Option<ModalContent>,
}

impl ModalHost {
    /// Mounts `content`, replacing the previous one. Returns true when the
    /// modal went from closed to open.
    pub fn render(&mut self, content: ModalContent) -> bool {
        self.content.replace(content).is_none()
    }

    /// Returns true when an open modal was closed.
    pub fn close(&mut self) -> bool {
        self.content.take().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&ModalContent> {
        self.content.as_ref()
    }

    pub fn mounted(&self) -> Option<ModalKind> {
        self.content.as_ref().map(ModalContent::kind)
    }
}
