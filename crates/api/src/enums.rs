//! Wire enums of the document domain
//!
//! Variant names are what constructors and setters accept as text
//! (`"Email"`); wire strings are what the service sends and receives
//! (`"email"`).

use scrive_core::wire_enum;

wire_enum! {
    /// Where a document is in its signing process
    pub enum DocumentStatus {
        /// Draft, still editable
        Preparation => "preparation",
        /// Sent out for signing
        Pending => "pending",
        /// Signed by every signing party
        Closed => "closed",
        /// Withdrawn by the author
        Canceled => "canceled",
        /// Signing deadline passed
        Timedout => "timedout",
        /// Rejected by a signatory
        Rejected => "rejected",
        /// Failed server-side processing
        DocumentError => "document_error",
    }
}

wire_enum! {
    /// Language of the signing flow and its messages
    pub enum Language {
        /// English
        En => "en",
        /// Swedish
        Sv => "sv",
        /// German
        De => "de",
        /// French
        Fr => "fr",
        /// Italian
        It => "it",
        /// Spanish
        Es => "es",
        /// Portuguese
        Pt => "pt",
        /// Dutch
        Nl => "nl",
        /// Danish
        Da => "da",
        /// Norwegian
        No => "no",
        /// Greek
        El => "el",
        /// Finnish
        Fi => "fi",
    }
    aliases {
        "gb" => En,
    }
}

wire_enum! {
    /// How the invitation to sign reaches a signatory
    pub enum DeliveryMethod {
        /// Invitation by email
        Email => "email",
        /// Invitation by text message
        Mobile => "mobile",
        /// Both email and text message
        EmailAndMobile => "email_mobile",
        /// Signing in person on a shared device
        Pad => "pad",
        /// The integrating application delivers the link itself
        Api => "api",
    }
}

wire_enum! {
    /// How the signed copy reaches a signatory
    pub enum ConfirmationDeliveryMethod {
        /// Copy by email
        Email => "email",
        /// Copy by text message
        Mobile => "mobile",
        /// Both email and text message
        EmailAndMobile => "email_mobile",
        /// No confirmation is sent
        NoDelivery => "none",
    }
}

wire_enum! {
    /// How a signatory proves their identity when signing
    pub enum AuthenticationMethod {
        /// Link possession only
        Standard => "standard",
        /// Electronic identification
        Eleg => "eleg",
        /// One-time PIN by text message
        SmsPin => "sms_pin",
    }
}

wire_enum! {
    /// Kind of a signatory field
    pub enum FieldType {
        /// Predefined personal field (name, email, ...)
        Standard => "standard",
        /// Free-form field defined by the author
        Custom => "custom",
        /// Drawn signature
        Signature => "signature",
        /// Tick box
        Checkbox => "checkbox",
    }
}

wire_enum! {
    /// Side of a placement where its arrow tip points
    pub enum TipSide {
        /// Arrow on the left
        Left => "left",
        /// Arrow on the right
        Right => "right",
    }
}
