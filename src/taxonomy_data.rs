//! Builtin intent table
//!
//! Phrases are lower-case and matched on word boundaries. Order matters only as
//! the last tie-break of the pattern classifier.

pub(crate) struct IntentSpec {
    pub id: &'static str,
    pub description: &'static str,
    pub triggers: &'static [&'static str],
    pub negatives: &'static [&'static str],
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

macro_rules! intent {
    ($id:expr, $desc:expr, [$($t:expr),* $(,)?], [$($n:expr),* $(,)?], [$($r:expr),* $(,)?], [$($o:expr),* $(,)?] $(,)?) => {
        IntentSpec {
            id: $id,
            description: $desc,
            triggers: &[$($t),*],
            negatives: &[$($n),*],
            required: &[$($r),*],
            optional: &[$($o),*],
        }
    };
}

#[rustfmt::skip]
pub(crate) static BUILTIN_INTENTS: &[IntentSpec] = &[
    // e-commerce
    intent!("e-commerce.order.confirmation", "Order placed and confirmed by a merchant",
        ["order confirmed", "order confirmation", "thank you for your order", "thanks for your order", "we received your order", "order has been placed"],
        ["has shipped", "cancelled", "canceled", "refund"],
        ["orderNumber"], ["amount", "senderDomain"]),
    intent!("e-commerce.shipping.notification", "Package shipped or in transit with tracking",
        ["has shipped", "shipped", "on its way", "tracking", "package", "shipment", "in transit"],
        ["delivered", "out for delivery", "delayed", "return label"],
        ["trackingNumber"], ["carrier", "orderNumber", "deliveryDate"]),
    intent!("e-commerce.shipping.out-for-delivery", "Package is out for delivery today",
        ["out for delivery", "arriving today", "delivery today"],
        ["delivered"],
        [], ["trackingNumber", "carrier"]),
    intent!("e-commerce.shipping.delayed", "Shipment delay or exception",
        ["delayed", "delivery exception", "shipping delay", "running late", "new delivery date"],
        [],
        [], ["trackingNumber", "carrier", "deliveryDate"]),
    intent!("e-commerce.delivery.confirmation", "Package has been delivered",
        ["has been delivered", "was delivered", "delivered", "left at your door", "package delivered"],
        ["out for delivery", "not delivered", "attempted delivery"],
        [], ["trackingNumber", "carrier"]),
    intent!("e-commerce.delivery.failed", "Delivery attempt failed or missed",
        ["attempted delivery", "delivery attempt", "missed delivery", "not delivered", "unable to deliver"],
        [],
        [], ["trackingNumber", "carrier"]),
    intent!("e-commerce.order.cancelled", "Order cancellation notice",
        ["order cancelled", "order canceled", "cancellation confirmed", "has been cancelled", "has been canceled"],
        ["subscription"],
        [], ["orderNumber", "amount"]),
    intent!("e-commerce.return.initiated", "Return started, label or instructions attached",
        ["return label", "return request", "return initiated", "start a return", "return authorization"],
        [],
        [], ["orderNumber", "trackingNumber"]),
    intent!("e-commerce.refund.processed", "Refund issued for an order",
        ["refund", "refunded", "refund processed", "money back"],
        ["refund policy"],
        [], ["amount", "orderNumber"]),
    intent!("e-commerce.cart.abandoned", "Reminder about items left in a cart",
        ["left in your cart", "still in your cart", "complete your purchase", "forgot something", "your cart"],
        [],
        [], ["promoCode"]),
    intent!("e-commerce.restock.alert", "Item back in stock",
        ["back in stock", "restocked", "restock", "available again"],
        [],
        [], ["url"]),
    intent!("e-commerce.price.drop", "Price drop on a watched item",
        ["price drop", "price dropped", "lower price", "now on sale"],
        [],
        [], ["amount", "url"]),
    intent!("e-commerce.review.request", "Merchant asks for a product review",
        ["leave a review", "write a review", "rate your purchase", "how did we do", "review your purchase"],
        [],
        [], ["orderNumber", "url"]),
    intent!("e-commerce.receipt.purchase", "In-store or online purchase receipt",
        ["your receipt", "receipt for", "purchase receipt", "e-receipt"],
        [],
        [], ["amount", "orderNumber"]),
    intent!("e-commerce.subscription.box", "Subscription box shipping or curation",
        ["subscription box", "this month's box", "your box"],
        [],
        [], ["trackingNumber"]),
    intent!("e-commerce.pickup.ready", "Order ready for in-store pickup",
        ["ready for pickup", "ready to pick up", "curbside pickup", "pickup order"],
        [],
        [], ["orderNumber"]),
    intent!("e-commerce.warranty.registration", "Product warranty or registration",
        ["warranty", "register your product", "product registration"],
        [],
        [], ["orderNumber"]),
    // billing
    intent!("billing.invoice.due", "Invoice issued with an amount due",
        ["invoice", "amount due", "payment due", "balance due", "due date", "please pay"],
        ["paid in full", "payment received"],
        ["amount"], ["dueDate", "invoiceNumber"]),
    intent!("billing.invoice.overdue", "Invoice past its due date",
        ["overdue", "past due", "late payment", "late fee", "final notice"],
        ["paid in full"],
        ["amount"], ["dueDate", "invoiceNumber"]),
    intent!("billing.payment.received", "Payment received or processed",
        ["payment received", "payment confirmation", "thank you for your payment", "payment successful", "paid in full"],
        ["failed", "declined"],
        [], ["amount", "invoiceNumber"]),
    intent!("billing.payment.failed", "Payment failed or card declined",
        ["payment failed", "card declined", "declined", "unable to process your payment", "update your payment method"],
        [],
        [], ["amount"]),
    intent!("billing.payment.scheduled", "Upcoming scheduled or automatic payment",
        ["scheduled payment", "autopay", "automatic payment", "will be charged", "upcoming payment"],
        [],
        [], ["amount", "dueDate"]),
    intent!("billing.statement.ready", "New account statement available",
        ["statement is ready", "statement available", "monthly statement", "your statement", "e-statement"],
        [],
        [], ["amount", "dueDate"]),
    intent!("billing.subscription.renewal", "Subscription renewal notice",
        ["renewal", "will renew", "auto-renew", "renews on", "subscription renewal"],
        ["cancelled", "canceled"],
        [], ["amount", "dueDate"]),
    intent!("billing.subscription.cancelled", "Subscription cancellation confirmed",
        ["subscription cancelled", "subscription canceled", "cancelled your subscription", "canceled your subscription", "membership cancelled"],
        [],
        [], ["dueDate"]),
    intent!("billing.subscription.trial-ending", "Free trial about to end",
        ["trial ends", "trial ending", "free trial", "trial will end", "trial expires"],
        [],
        [], ["amount", "dueDate"]),
    intent!("billing.utility.bill", "Utility bill (electric, gas, water, internet)",
        ["electric bill", "utility bill", "water bill", "gas bill", "energy usage", "internet bill"],
        [],
        ["amount"], ["dueDate", "invoiceNumber"]),
    intent!("billing.phone.bill", "Mobile phone bill",
        ["wireless bill", "phone bill", "mobile bill", "your bill is ready"],
        [],
        [], ["amount", "dueDate"]),
    intent!("billing.price.change", "Notice of a price change to a plan",
        ["price increase", "price change", "new pricing", "rate change"],
        [],
        [], ["amount", "eventDate"]),
    // finance
    intent!("finance.banking.alert", "Bank account alert",
        ["account alert", "low balance", "balance alert", "large transaction", "direct deposit"],
        [],
        [], ["amount"]),
    intent!("finance.banking.transfer", "Money transfer sent or received",
        ["transfer", "wire transfer", "you sent", "you received", "zelle", "venmo"],
        ["transfer your number"],
        [], ["amount"]),
    intent!("finance.credit.card-activity", "Credit card transaction notice",
        ["card activity", "transaction alert", "purchase alert", "charged to your card"],
        [],
        [], ["amount"]),
    intent!("finance.credit.score-update", "Credit score change",
        ["credit score", "credit report", "score changed"],
        [],
        [], []),
    intent!("finance.fraud.alert", "Suspected fraud on an account",
        ["fraud alert", "suspicious transaction", "unusual activity", "did you make this purchase"],
        [],
        [], ["amount"]),
    intent!("finance.investment.update", "Brokerage or investment update",
        ["portfolio", "dividend", "trade confirmation", "brokerage", "investment"],
        [],
        [], ["amount"]),
    intent!("finance.tax.document", "Tax form or document available",
        ["tax document", "1099", "w-2", "tax form", "tax return", "irs"],
        [],
        [], ["dueDate"]),
    intent!("finance.loan.payment", "Loan or mortgage payment notice",
        ["loan payment", "mortgage", "student loan", "installment"],
        [],
        [], ["amount", "dueDate"]),
    intent!("finance.crypto.activity", "Cryptocurrency account activity",
        ["bitcoin", "crypto", "ethereum", "wallet activity"],
        [],
        [], ["amount"]),
    intent!("finance.expense.report", "Expense report submission or approval",
        ["expense report", "reimbursement", "expense approved", "submit your expenses"],
        [],
        [], ["amount"]),
    // travel
    intent!("travel.flight.confirmation", "Flight booking confirmation",
        ["flight confirmation", "booking confirmation", "itinerary", "e-ticket", "your flight"],
        ["check in now", "boarding pass", "cancelled", "canceled", "delayed"],
        [], ["flightNumber", "confirmationCode", "eventDate"]),
    intent!("travel.flight.check-in", "Online check-in open for a flight",
        ["check in now", "check-in is open", "check in for your flight", "online check-in", "check in online"],
        [],
        [], ["flightNumber", "confirmationCode", "eventDate"]),
    intent!("travel.flight.boarding-pass", "Boarding pass delivered",
        ["boarding pass", "mobile boarding pass", "boarding group"],
        [],
        [], ["flightNumber", "confirmationCode"]),
    intent!("travel.flight.change", "Flight delayed, cancelled or rescheduled",
        ["flight delayed", "flight cancelled", "flight canceled", "schedule change", "gate change", "new departure time"],
        [],
        [], ["flightNumber", "confirmationCode"]),
    intent!("travel.hotel.reservation", "Hotel reservation confirmation",
        ["hotel", "reservation confirmed", "your stay", "check-in date", "room"],
        ["restaurant", "table for"],
        [], ["confirmationCode", "eventDate"]),
    intent!("travel.rental.car", "Car rental reservation",
        ["car rental", "rental car", "pick-up location", "your rental"],
        [],
        [], ["confirmationCode", "eventDate"]),
    intent!("travel.rideshare.receipt", "Ride receipt from a rideshare service",
        ["your ride", "trip receipt", "thanks for riding", "your trip with"],
        [],
        [], ["amount"]),
    intent!("travel.train.ticket", "Rail ticket or booking",
        ["train ticket", "rail", "amtrak", "your train"],
        [],
        [], ["confirmationCode", "eventDate"]),
    intent!("travel.cruise.booking", "Cruise booking or pre-boarding info",
        ["cruise", "sail date", "embarkation"],
        [],
        [], ["confirmationCode", "eventDate"]),
    intent!("travel.vacation.rental", "Vacation rental booking",
        ["airbnb", "vrbo", "vacation rental", "your host"],
        [],
        [], ["confirmationCode", "eventDate"]),
    intent!("travel.loyalty.points", "Travel loyalty points or status",
        ["miles balance", "elite status", "frequent flyer", "award miles"],
        [],
        [], []),
    intent!("travel.visa.document", "Visa or travel document requirement",
        ["visa", "passport", "travel document", "esta"],
        [],
        [], ["dueDate"]),
    intent!("travel.itinerary.reminder", "Upcoming trip reminder",
        ["upcoming trip", "trip reminder", "your trip", "get ready for your trip"],
        [],
        [], ["eventDate", "confirmationCode"]),
    // education
    intent!("education.permission.form", "School permission slip or consent form to sign",
        ["permission slip", "permission form", "consent form", "sign and return", "field trip", "parent signature"],
        [],
        [], ["amount", "eventDate", "dueDate"]),
    intent!("education.assignment.due", "Homework or assignment deadline",
        ["assignment", "homework", "due tomorrow", "submission deadline", "project due"],
        ["graded"],
        [], ["dueDate"]),
    intent!("education.grade.posted", "Grade or report card published",
        ["grade posted", "grades posted", "report card", "graded", "your grade"],
        [],
        [], []),
    intent!("education.school.announcement", "General school announcement",
        ["school", "principal", "pta", "classroom", "teacher"],
        [],
        [], ["eventDate"]),
    intent!("education.school.closure", "School closure or delay",
        ["school closed", "snow day", "early dismissal", "delayed opening"],
        [],
        [], ["eventDate"]),
    intent!("education.conference.scheduling", "Parent-teacher conference scheduling",
        ["parent-teacher conference", "parent teacher conference", "conference sign-up"],
        [],
        [], ["eventDate"]),
    intent!("education.tuition.payment", "Tuition or school fee payment",
        ["tuition", "school fees", "lunch account", "lunch balance"],
        [],
        [], ["amount", "dueDate"]),
    intent!("education.course.enrollment", "Course enrollment or registration",
        ["enrollment", "course registration", "you're enrolled", "registration is open"],
        [],
        [], ["eventDate"]),
    intent!("education.course.update", "Online course lesson or progress update",
        ["new lesson", "course update", "continue learning", "your course"],
        [],
        [], ["url"]),
    intent!("education.certificate.earned", "Certificate or completion earned",
        ["certificate", "course completed", "congratulations on completing"],
        [],
        [], ["url"]),
    intent!("education.library.due", "Library book due or hold available",
        ["library", "hold is ready", "items due", "renew your items"],
        [],
        [], ["dueDate"]),
    intent!("education.sports.schedule", "Youth sports schedule or practice",
        ["practice schedule", "game schedule", "team practice", "tournament"],
        [],
        [], ["eventDate"]),
    // events & calendar
    intent!("events.meeting.invitation", "Meeting invitation",
        ["invitation", "you're invited", "meeting invite", "join the meeting", "calendar invite"],
        ["accepted", "declined", "party", "wedding"],
        [], ["eventDate", "meetingUrl"]),
    intent!("events.meeting.update", "Meeting rescheduled or updated",
        ["meeting updated", "rescheduled", "new time", "time change"],
        [],
        [], ["eventDate", "meetingUrl"]),
    intent!("events.meeting.cancelled", "Meeting cancelled",
        ["meeting cancelled", "meeting canceled", "event cancelled", "event canceled"],
        [],
        [], ["eventDate"]),
    intent!("events.meeting.response", "Attendee accepted or declined",
        ["accepted", "declined", "tentatively accepted", "has accepted"],
        [],
        [], ["eventDate"]),
    intent!("events.rsvp.request", "Event RSVP request",
        ["rsvp", "please respond", "let us know if you can make it", "save the date"],
        [],
        [], ["eventDate"]),
    intent!("events.ticket.confirmation", "Event ticket purchase",
        ["your tickets", "ticket confirmation", "e-tickets", "admit one", "ticketmaster"],
        [],
        [], ["eventDate", "confirmationCode", "amount"]),
    intent!("events.webinar.registration", "Webinar registration or reminder",
        ["webinar", "live session", "register now", "starts in"],
        [],
        [], ["eventDate", "meetingUrl"]),
    intent!("events.reminder.upcoming", "Reminder for an upcoming event",
        ["reminder", "don't forget", "coming up", "starts tomorrow"],
        [],
        [], ["eventDate"]),
    intent!("events.social.party", "Party or celebration invitation",
        ["party", "birthday", "celebration", "wedding", "baby shower"],
        [],
        [], ["eventDate"]),
    intent!("events.volunteer.signup", "Volunteer sign-up request",
        ["volunteer", "sign-up sheet", "signup genius", "help needed"],
        [],
        [], ["eventDate"]),
    // healthcare
    intent!("healthcare.appointment.reminder", "Upcoming medical appointment",
        ["appointment reminder", "upcoming appointment", "your appointment", "confirm your appointment"],
        ["cancelled", "canceled"],
        [], ["eventDate"]),
    intent!("healthcare.appointment.booking", "Appointment booked",
        ["appointment confirmed", "appointment scheduled", "booked an appointment"],
        [],
        [], ["eventDate"]),
    intent!("healthcare.prescription.ready", "Prescription ready or refill due",
        ["prescription", "refill", "pharmacy", "ready for pickup at"],
        [],
        [], []),
    intent!("healthcare.results.available", "Lab or test results available",
        ["test results", "lab results", "results are available", "new results"],
        [],
        [], []),
    intent!("healthcare.billing.statement", "Medical bill or EOB",
        ["explanation of benefits", "medical bill", "patient statement", "copay"],
        [],
        [], ["amount", "dueDate"]),
    intent!("healthcare.portal.message", "Message from a provider portal",
        ["patient portal", "mychart", "message from your provider", "secure message"],
        [],
        [], ["url"]),
    intent!("healthcare.insurance.update", "Health insurance coverage update",
        ["health insurance", "coverage", "open enrollment", "benefits summary"],
        [],
        [], ["dueDate"]),
    intent!("healthcare.vaccination.reminder", "Vaccination or checkup due",
        ["vaccination", "vaccine", "flu shot", "annual checkup"],
        [],
        [], ["eventDate"]),
    intent!("healthcare.dental.reminder", "Dental cleaning or checkup",
        ["dental", "dentist", "cleaning appointment", "orthodontist"],
        [],
        [], ["eventDate"]),
    intent!("healthcare.pet.care", "Veterinary appointment or pet reminder",
        ["vet", "veterinary", "your pet", "pet insurance"],
        [],
        [], ["eventDate"]),
    // account & security
    intent!("account.security.login-alert", "New sign-in detected",
        ["new sign-in", "new login", "signed in from", "new device", "login attempt"],
        [],
        [], []),
    intent!("account.security.password-reset", "Password reset requested",
        ["reset your password", "password reset", "forgot your password", "change your password"],
        ["password was changed"],
        [], ["url"]),
    intent!("account.security.password-changed", "Password changed confirmation",
        ["password was changed", "password has been changed", "password updated"],
        [],
        [], []),
    intent!("account.security.verification-code", "One-time code or 2FA",
        ["verification code", "one-time code", "security code", "passcode", "2-step verification", "two-factor"],
        [],
        [], ["confirmationCode"]),
    intent!("account.verification.email", "Verify your email address",
        ["verify your email", "confirm your email", "activate your account", "verify your account"],
        [],
        [], ["url"]),
    intent!("account.welcome.onboarding", "Welcome and onboarding message",
        ["welcome to", "thanks for signing up", "getting started", "get started"],
        [],
        [], ["url"]),
    intent!("account.update.terms", "Terms of service or privacy policy update",
        ["terms of service", "privacy policy", "updated our terms", "policy update"],
        [],
        [], ["eventDate"]),
    intent!("account.data.breach", "Data breach notification",
        ["data breach", "security incident", "compromised", "unauthorized access"],
        [],
        [], []),
    intent!("account.deletion.notice", "Account closure or deletion",
        ["account will be deleted", "account closure", "deactivated", "inactive account"],
        [],
        [], ["dueDate"]),
    intent!("account.storage.limit", "Storage quota warning",
        ["storage is full", "out of storage", "storage limit", "running out of space"],
        [],
        [], []),
    // marketing
    intent!("marketing.promotion.sale", "Sale or discount promotion",
        ["sale", "% off", "discount", "limited time", "shop now", "deal"],
        ["order confirmed", "your receipt"],
        [], ["promoCode", "url"]),
    intent!("marketing.promotion.coupon", "Coupon or promo code",
        ["coupon", "promo code", "use code", "exclusive offer"],
        [],
        ["promoCode"], ["url"]),
    intent!("marketing.new-arrivals.announcement", "New product or collection launch",
        ["new arrival", "new arrivals", "new collection", "just dropped", "launching"],
        [],
        [], ["url"]),
    intent!("marketing.loyalty.rewards", "Loyalty points or member rewards",
        ["reward", "rewards", "points", "loyalty", "member exclusive"],
        ["credit score"],
        [], []),
    intent!("marketing.event.invitation", "Brand event or in-store event",
        ["in-store event", "vip event", "exclusive event", "grand opening"],
        [],
        [], ["eventDate"]),
    intent!("marketing.survey.request", "Survey or feedback request",
        ["survey", "feedback", "tell us what you think", "share your opinion"],
        [],
        [], ["url"]),
    intent!("marketing.referral.program", "Referral invitation",
        ["refer a friend", "referral", "give $", "invite friends"],
        [],
        [], ["promoCode"]),
    intent!("marketing.win-back.offer", "We miss you offer",
        ["we miss you", "come back", "it's been a while"],
        [],
        [], ["promoCode"]),
    // social
    intent!("social.notification.activity", "Social network activity notification",
        ["liked your", "commented on", "mentioned you", "tagged you", "new follower", "followed you"],
        [],
        [], ["url"]),
    intent!("social.message.received", "Direct message on a social platform",
        ["sent you a message", "new message from", "unread messages"],
        [],
        [], ["url"]),
    intent!("social.connection.request", "Connection or friend request",
        ["friend request", "wants to connect", "connection request", "invitation to connect"],
        [],
        [], ["url"]),
    intent!("social.digest.summary", "Social network digest",
        ["what you missed", "top stories", "trending in your network", "people you may know"],
        [],
        [], []),
    intent!("social.community.post", "Community forum or group post",
        ["new post in", "group post", "forum", "community update"],
        [],
        [], ["url"]),
    // communication & work
    intent!("communication.thread.reply", "Reply in an ongoing conversation",
        ["re:", "replied", "following up", "circling back", "as discussed"],
        [],
        [], []),
    intent!("communication.personal.message", "Personal note from an individual",
        ["hope you're well", "catch up", "how are you", "thinking of you"],
        [],
        [], []),
    intent!("communication.request.information", "Someone requests information or an answer",
        ["can you send", "could you please", "please let me know", "do you have", "quick question"],
        [],
        [], ["dueDate"]),
    intent!("communication.introduction.contact", "Introduction to a new contact",
        ["introducing", "i'd like to introduce", "meet my colleague", "connecting you"],
        [],
        [], []),
    intent!("communication.voicemail.transcript", "Voicemail notification",
        ["voicemail", "missed call", "new voice message"],
        [],
        [], []),
    intent!("work.task.assigned", "Task assigned in a work tool",
        ["assigned to you", "assigned you", "new task", "action required"],
        [],
        [], ["dueDate", "url"]),
    intent!("work.review.requested", "Review or approval requested",
        ["review requested", "requested your review", "approval required", "please approve", "pending approval"],
        [],
        [], ["url", "dueDate"]),
    intent!("work.document.shared", "Document shared with the user",
        ["shared a document", "shared with you", "has shared", "invited you to edit"],
        [],
        [], ["url"]),
    intent!("work.deadline.reminder", "Work deadline reminder",
        ["deadline", "due by", "end of day", "eod"],
        [],
        [], ["dueDate"]),
    intent!("work.timesheet.reminder", "Timesheet or time-off reminder",
        ["timesheet", "time off request", "pto request", "submit your hours"],
        [],
        [], ["dueDate"]),
    intent!("work.payroll.paystub", "Paystub or payroll notice",
        ["paystub", "pay stub", "payroll", "direct deposit notice"],
        [],
        [], ["amount"]),
    intent!("work.build.failed", "CI build or deploy failure",
        ["build failed", "pipeline failed", "deployment failed", "tests failed"],
        [],
        [], ["url"]),
    intent!("work.incident.alert", "Production incident or on-call alert",
        ["incident", "outage", "on-call", "pagerduty", "sev1"],
        [],
        [], ["url"]),
    // careers
    intent!("career.job.application", "Job application received or update",
        ["your application", "application received", "thank you for applying", "application status"],
        [],
        [], []),
    intent!("career.interview.invitation", "Interview scheduling",
        ["interview", "schedule a call", "phone screen", "next round"],
        [],
        [], ["eventDate", "meetingUrl"]),
    intent!("career.offer.letter", "Job offer",
        ["offer letter", "pleased to offer", "job offer", "compensation package"],
        [],
        [], ["dueDate"]),
    intent!("career.job.alert", "Job recommendations",
        ["job alert", "new jobs", "jobs for you", "recommended jobs"],
        [],
        [], ["url"]),
    // content
    intent!("content.newsletter.digest", "Newsletter or editorial digest",
        ["newsletter", "digest", "weekly roundup", "this week in", "issue #"],
        [],
        [], ["url"]),
    intent!("content.article.recommendation", "Recommended articles or reading",
        ["recommended for you", "read more", "you might like", "top picks"],
        [],
        [], ["url"]),
    intent!("content.podcast.episode", "New podcast or video episode",
        ["new episode", "podcast", "now streaming", "watch now"],
        [],
        [], ["url"]),
    intent!("content.blog.update", "Blog post or product changelog",
        ["blog post", "changelog", "release notes", "what's new"],
        [],
        [], ["url"]),
    // civic & government
    intent!("civic.political.donation", "Political fundraising",
        ["donate", "campaign", "chip in", "fundraising deadline"],
        [],
        [], ["amount"]),
    intent!("civic.voting.reminder", "Voting or election reminder",
        ["vote", "election", "polling place", "ballot", "register to vote"],
        [],
        [], ["eventDate"]),
    intent!("civic.charity.donation-receipt", "Donation receipt from a charity",
        ["donation receipt", "thank you for your donation", "tax-deductible", "your gift"],
        [],
        [], ["amount"]),
    intent!("civic.government.notice", "Government agency notice",
        ["dmv", "jury duty", "court", "government", "license renewal"],
        [],
        [], ["dueDate"]),
    intent!("civic.community.alert", "Local community or safety alert",
        ["neighborhood", "community alert", "road closure", "emergency alert"],
        [],
        [], ["eventDate"]),
    // home & services
    intent!("home.service.appointment", "Home service visit scheduled",
        ["technician", "service appointment", "installation appointment", "arrival window"],
        [],
        [], ["eventDate"]),
    intent!("home.real-estate.listing", "Real estate listing alert",
        ["new listing", "open house", "price reduced", "homes for sale"],
        [],
        [], ["url"]),
    intent!("home.rent.payment", "Rent due or lease notice",
        ["rent", "lease", "landlord", "property management"],
        [],
        [], ["amount", "dueDate"]),
    intent!("home.security.alert", "Home security camera or alarm",
        ["motion detected", "doorbell", "alarm", "camera"],
        [],
        [], []),
    intent!("home.smart-device.update", "Smart home device notification",
        ["firmware update", "device offline", "smart home", "thermostat"],
        [],
        [], []),
    // food
    intent!("food.delivery.order", "Food delivery order update",
        ["doordash", "uber eats", "grubhub", "your food", "order is on the way"],
        [],
        [], ["amount"]),
    intent!("food.restaurant.reservation", "Restaurant reservation",
        ["restaurant", "table for", "opentable", "dining reservation"],
        [],
        [], ["eventDate", "confirmationCode"]),
    intent!("food.grocery.order", "Grocery order or delivery",
        ["grocery", "instacart", "substitution", "groceries"],
        [],
        [], ["amount"]),
    intent!("food.meal-kit.delivery", "Meal kit box update",
        ["meal kit", "hellofresh", "recipes this week", "skip this week"],
        [],
        [], ["eventDate"]),
    // insurance & legal
    intent!("insurance.policy.renewal", "Insurance policy renewal",
        ["policy renewal", "your policy", "premium", "insurance renewal"],
        [],
        [], ["amount", "dueDate"]),
    intent!("insurance.claim.update", "Insurance claim status",
        ["claim", "claim number", "adjuster", "claim status"],
        [],
        [], ["amount"]),
    intent!("legal.document.signature", "Document awaiting e-signature",
        ["docusign", "please sign", "signature requested", "review and sign", "e-signature"],
        [],
        [], ["dueDate", "url"]),
    intent!("legal.contract.update", "Contract or agreement update",
        ["contract", "agreement", "amendment", "terms and conditions"],
        [],
        [], ["dueDate"]),
    // support
    intent!("support.ticket.created", "Support ticket opened",
        ["ticket created", "support request", "case number", "we received your request"],
        [],
        [], ["confirmationCode"]),
    intent!("support.ticket.resolved", "Support ticket resolved",
        ["ticket resolved", "case closed", "has been resolved", "issue resolved"],
        [],
        [], ["confirmationCode"]),
    intent!("support.feedback.request", "Rate your support experience",
        ["rate your experience", "how was your support", "customer satisfaction"],
        [],
        [], ["url"]),
    // entertainment
    intent!("entertainment.streaming.new-content", "New show or movie on a streaming service",
        ["new on", "now available", "new season", "watch the trailer"],
        [],
        [], ["url"]),
    intent!("entertainment.gaming.update", "Gaming account or store update",
        ["steam", "playstation", "xbox", "game update", "achievement"],
        [],
        [], []),
    intent!("entertainment.music.release", "New music release",
        ["new album", "new single", "concert", "tour dates"],
        [],
        [], ["eventDate"]),
    // fitness
    intent!("fitness.class.booking", "Fitness class booked or reminder",
        ["class booked", "yoga", "spin class", "gym", "workout"],
        [],
        [], ["eventDate"]),
    intent!("fitness.activity.summary", "Fitness tracker summary",
        ["weekly summary", "steps", "activity report", "personal record"],
        [],
        [], []),
    // generic
    intent!("generic.transactional", "Transactional email with no more specific intent",
        ["receipt", "confirmation", "notification", "account"],
        [],
        [], []),
    intent!("generic.newsletter", "Bulk mail with no actionable content",
        ["unsubscribe", "view in browser", "email preferences"],
        [],
        [], []),
    intent!("generic.personal", "Personal correspondence with no specific request",
        ["hi", "hello", "thanks"],
        [],
        [], []),
];
