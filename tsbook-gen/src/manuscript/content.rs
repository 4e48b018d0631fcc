//! Fixed book text compiled into the generator

/// Page break before a chapter
pub const PAGE_BREAK_BEFORE: &str = "<div style='page-break-before: always;'></div>\n\n";

/// Page break after a front-matter page
pub const PAGE_BREAK_AFTER: &str = "<div style='page-break-after: always;'></div>\n\n";

pub const INTRODUCTION: &str = "\
Terran Society represents a comprehensive framework for human governance designed to protect individual rights, ensure accountability, and create sustainable prosperity. Unlike traditional systems of governance that concentrate power, Terran Society distributes authority across multiple tiers and branches with built-in checks and balances.

The foundation of this system rests on two pillars: the Rights of the People and the Basic Principles. These establish the core values that guide every aspect of Terran Society's operations. From these foundations emerges an organizational structure spanning three tiers (District, Region and World), each with specific responsibilities and limitations.

### Core Objectives

Terran Society exists to:

1. **Protect the Rights of the People**: every member's fundamental rights are guaranteed and actively defended
2. **Meet Basic Needs**: ensure all members have access to clean food, water, air, shelter, safety, privacy, information, travel, and healthcare
3. **Provide Just Governance**: create transparent, accountable systems for collective decision-making
4. **Enable Peaceful Resolution**: establish fair processes for resolving disputes without violence
5. **Ensure Common Defense**: protect the society and its members from external threats
6. **Foster Sustainability**: build systems that can endure for generations while respecting the natural world

### Why a New System?

Current governance systems worldwide share common flaws: concentrated power, lack of transparency, erosion of individual rights, and structures that serve special interests rather than the people. Terran Society addresses these systemic problems through:

- **Decentralization**: power is distributed across regions and branches, preventing dangerous concentrations
- **Transparency**: the Fair Witness branch ensures all Society operations are recorded and public
- **Direct Accountability**: most major positions are directly elected by the people they serve
- **Rights-First Approach**: the Rights of the People cannot be legislated away
- **Practical Scale**: Regions are sized for responsive governance (maximum 20-25 million people)

### How to Use This Book

This book provides a guide to Terran Society's structure and operations. It is organized to build understanding progressively:

- **Basic Principles**: the fundamental values guiding all operations
- **Rights of the People**: the complete enumeration of protected rights
- **Organizational Structure**: each tier and branch in turn
- **Roles and Responsibilities**: every position and its duties
- **Processes and Procedures**: how elections, legislation, courts, and other systems operate

Throughout this book, terms appearing in the Glossary are capitalized when referring to specific offices or institutions (\"Administrator\" for the office, \"administrator\" for the general concept).

";

/// A basic principle: title, statement, elaboration
pub struct Principle {
    pub title: &'static str,
    pub statement: &'static str,
    pub elaboration: &'static str,
}

pub const PRINCIPLES: &[Principle] = &[
    Principle {
        title: "Operations Transparency",
        statement: "Terran Society operations need to be open, transparent and accessible to all members as the base of power is the informed individual.",
        elaboration: "An informed citizenry is the only reliable check on power. All meetings of governing bodies must be observed by Fair Witnesses, and records must be freely accessible. Secret legislation or hidden agendas cannot exist in this system.",
    },
    Principle {
        title: "Member-Centric Design",
        statement: "Terran Society services and systems must be designed, developed and administered for the benefit of all members.",
        elaboration: "Society management exists to serve the people, not the other way around. Every system, service, and structure is evaluated on whether it benefits all members. Policies that advantage one group at the expense of others violate this principle.",
    },
    Principle {
        title: "Environmental Stewardship",
        statement: "We are caretakers in this wonderful world shared with many other beings, pollution of air, water and land is to be avoided and cleaned up.",
        elaboration: "Humans are part of a larger ecological community, and our survival depends on clean air, water, and soil. Environmental protection is a core requirement, not an optional add-on. The Environmental Guardian role exists at both Regional and World levels to enforce this principle.",
    },
    Principle {
        title: "Equal Regional Treatment",
        statement: "Services provided to Regions must be administered equally per Region.",
        elaboration: "No Region receives preferential treatment in the allocation of resources or services. World-level services are distributed equally per Region regardless of population, wealth, or political influence.",
    },
    Principle {
        title: "Sustainable Infrastructure",
        statement: "Permanent structures & facilities shall be designed to last for future generations, have minimal maintenance and be as energy independent and efficient as is practical.",
        elaboration: "Short-term thinking creates long-term problems. Infrastructure is built to last generations, minimizing the burden on future members, with a preference for renewable energy, durable materials, and efficient design.",
    },
    Principle {
        title: "Regional Self-Sufficiency",
        statement: "Each community and region should be self-sufficient in a sustainable way for meeting their basic needs.",
        elaboration: "Resilience comes from local self-sufficiency. Trade and cooperation between Regions are encouraged, yet each Region should be able to meet its own basic needs. This prevents cascading failures and reduces vulnerability to disruption.",
    },
    Principle {
        title: "Single Branch Service",
        statement: "A Person may be on the staff of only one branch of World, Regional or District management or the Defense Force at a time.",
        elaboration: "Individuals cannot serve in multiple branches or tiers at once. This prevents conflicts of interest and distributes leadership opportunities across more people.",
    },
    Principle {
        title: "Inviolable Voting Rights",
        statement: "Voting rights and benefits cannot be revoked as punishment or penalty.",
        elaboration: "Voting rights and membership benefits are fundamental and cannot be revoked as punishment. Even those convicted of crimes retain their voice in society, so no permanent underclass can form.",
    },
];

pub const FOUNDATIONAL_STATEMENT: &str = "We are endowed by our Creator with certain in-alienable Rights, among these are Life, Liberty and the Pursuit of Happiness. These Rights are not to be violated by institutions, organizations or individuals. Our duty is to protect these Rights.";

/// Glossary definitions that exist regardless of store content
///
/// Role descriptions from the store replace these when both define a term.
pub const COMMON_DEFINITIONS: &[(&str, &str)] = &[
    ("Arbitration", "A method of dispute resolution where parties voluntarily agree to have an Arbitrator hear their case and make a binding decision."),
    ("Arbitrator", "An elected official who conducts arbitration hearings and issues binding rulings."),
    ("Branch", "One of the divisions of governance within a tier (executive, legislative, judicial or Fair Witness), each with its own institutions and limits."),
    ("Cooperative", "An organization owned and controlled by its members or workers, operating for mutual benefit rather than profit."),
    ("District", "The smallest tier of Terran Society, typically 5,000 to 21,000 people, governed by a Council of Elders."),
    ("Elder", "An elected member of a District Council of Elders."),
    ("Facilitator of the Court", "An elected official (also called Conductor) who presides over Major and Minor Courts."),
    ("Fair Witness", "An independent, certified observer who records Society proceedings objectively."),
    ("Jury", "A group of citizens who decide the outcome of court cases."),
    ("Public Service Cooperative", "A chartered organization that provides public services like utilities, transit, or ports."),
    ("Region", "The primary governance tier, with complete executive, legislative, judicial, and Fair Witness branches. Maximum population 20-25 million."),
    ("Representative", "An elected member of the Regional Council of the People."),
    ("Tier", "A level of governance (District, Region or World), each responsible for the matters too large for the tier below it."),
    ("World", "The planetary tier coordinating matters that span regions."),
];
